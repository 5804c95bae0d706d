//! Display-name and delimiter helpers shared by every renderer in the crate.

/// Typeset tensor-product glyph.
pub const OTIMES: &str = r" \otimes ";
/// Typeset glyph of the symmetrized tensor product.
pub const OTIMES_SYMMETRIC: &str = r" \otimes_{\mathrm{s}} ";

const PLAIN_OPENERS: [&str; 3] = ["(", "[", "{"];
const PLAIN_CLOSERS: [&str; 3] = [")", "]", "}"];
const TYPESET_OPENERS: [&str; 3] = ["(", "[", r"\{"];
const TYPESET_CLOSERS: [&str; 3] = [")", "]", r"\}"];

/// Math-mode rendering, alongside the plain [`std::fmt::Display`] form.
pub trait Typeset {
    fn typeset(&self) -> String;

    /// Standalone form, ready to drop into a document.
    fn typeset_display(&self) -> String {
        format!("${}$", self.typeset())
    }
}

/// Name of the derivative with respect to `parameter` of the quantity called `name`.
///
/// ```
/// # use simpletensors::naming::bump_derivative;
/// assert_eq!(bump_derivative("v", "t"), r"\partial_t v");
/// assert_eq!(bump_derivative(r"\partial_t v", "t"), r"\partial_t^{2} v");
/// assert_eq!(bump_derivative(r"\partial_t^{2} v", "t"), r"\partial_t^{3} v");
/// ```
pub fn bump_derivative(name: &str, parameter: &str) -> String {
    let bare = format!(r"\partial_{parameter}");
    let ordered = format!(r"{bare}^{{");

    if let Some(rest) = name.strip_prefix(&ordered) {
        if let Some((order, tail)) = rest.split_once('}') {
            if let Ok(order) = order.trim().parse::<usize>() {
                return format!("{ordered}{}}}{tail}", order + 1);
            }
        }
    }

    if let Some(tail) = name.strip_prefix(&bare) {
        return format!("{ordered}2}}{tail}");
    }

    format!("{bare} {name}")
}

/// Wrap `text` in a delimiter that differs from the first one it already contains.
///
/// With no `(`, `[` or `{` in `text` the result is parenthesized. Otherwise the
/// first opener found picks the next delimiter of the rotation `( → [ → { → (`,
/// so nested renderings never reuse their parent's delimiter. In typeset mode
/// the brace is the escaped `\{`, which never matches a single character, and
/// every delimiter is sized with `\left`/`\right`.
pub fn delimit(text: &str, typeset: bool) -> String {
    let (left, right, openers, closers) = if typeset {
        (r"\left", r"\right", TYPESET_OPENERS, TYPESET_CLOSERS)
    } else {
        ("", "", PLAIN_OPENERS, PLAIN_CLOSERS)
    };

    let first = text
        .chars()
        .find_map(|c| openers.iter().position(|o| o.len() == c.len_utf8() && o.starts_with(c)));

    match first {
        None => format!("{left}({text}{right})"),
        Some(found) => {
            let next = (found + 1) % openers.len();
            format!(
                "{left}{} {text} {right}{}",
                openers[next], closers[next]
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_orders_increase() {
        let once = bump_derivative("V", "t");
        assert_eq!(once, r"\partial_t V");
        let twice = bump_derivative(&once, "t");
        assert_eq!(twice, r"\partial_t^{2} V");
        let thrice = bump_derivative(&twice, "t");
        assert_eq!(thrice, r"\partial_t^{3} V");
        assert_eq!(thrice.matches(r"\partial").count(), 1);
    }

    #[test]
    fn derivative_with_other_parameter() {
        let dt = bump_derivative("V", "t");
        assert_eq!(bump_derivative(&dt, "x"), r"\partial_x \partial_t V");
        assert_eq!(
            bump_derivative(r"\partial_t^{12}\vec{n}", "t"),
            r"\partial_t^{13}\vec{n}"
        );
    }

    #[test]
    fn plain_rotation() {
        assert_eq!(delimit("a+b", false), "(a+b)");
        assert_eq!(delimit("(a+b)*c", false), "[ (a+b)*c ]");
        assert_eq!(delimit("[ (a+b)*c ]", false), "{ [ (a+b)*c ] }");
        assert_eq!(delimit("{x}", false), "( {x} )");
        assert_eq!(delimit("x*[y]*(z)", false), "{ x*[y]*(z) }");
    }

    #[test]
    fn typeset_rotation() {
        assert_eq!(delimit("a", true), r"\left(a\right)");
        assert_eq!(delimit(r"\left(a\right)", true), r"\left[ \left(a\right) \right]");
        assert_eq!(
            delimit(r"\left[ a \right]", true),
            r"\left\{ \left[ a \right] \right\}"
        );
        // braces of typeset commands are not delimiters
        assert_eq!(delimit(r"\vec{v}", true), r"\left(\vec{v}\right)");
    }
}
