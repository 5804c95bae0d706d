use std::{
    fmt::{self, Display},
    ops::{Add, Mul, Sub},
};

use num::{rational::Rational64, Zero};

use crate::{
    naming::{bump_derivative, delimit},
    Contract, ContractionError, Differentiate, Operand, Scalar, Tensor, TensorProduct, Trace,
    Typeset, Value, Vector,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn q(n: i64) -> Rational64 {
    Rational64::from_integer(n)
}

fn constant(name: &str, components: &[i64]) -> Vector<Rational64> {
    Vector::constant(name, components.iter().copied().map(q).collect())
}

#[test]
fn unit_vectors() {
    init();
    let e1 = constant("e_1", &[1, 0, 0]);
    let e2 = constant("e_2", &[0, 1, 0]);

    assert_eq!(e1.dot(&e2), Ok(q(0)));
    assert_eq!(e1.dot(&e1), Ok(q(1)));

    let e11 = e1.tensor(&e1);
    let e12 = e1.tensor(&e2);
    let e21 = e2.tensor(&e1);
    assert_eq!(e11.contract(&e11), Ok(q(1)));
    assert_eq!(e12.contract(&e12), Ok(q(1)));
    assert_eq!(e12.contract(&e21), Ok(q(0)));
    assert_eq!(e12.contract(&e11), Ok(q(0)));
}

#[test]
fn mixed_operations() {
    init();
    let e1: Operand<_> = constant("e_1", &[1, 0, 0]).into();
    let e2: Operand<_> = constant("e_2", &[0, 1, 0]).into();

    let e12 = e1.multiply(&e2);
    let e21 = e2.multiply(&e1);
    let twice = Operand::Scalar(q(2)).multiply(&e12.clone().into());
    let sum = twice
        .add(&e21.clone().into())
        .and_then(|s| s.add(&e12.multiply(&Operand::Scalar(q(-1))).into()))
        .unwrap();

    insta::assert_snapshot!(sum.to_string(), @"[ (e_1*e_2) + (e_2*e_1) ]");
    assert_eq!(sum.trace(0, 1), Ok(Value::Scalar(q(0))));
    assert_eq!(sum.contract(&e12.clone().into()), Ok(q(1)));
    assert_eq!(sum.contract(&sum.clone().into()), Ok(q(2)));

    let cancelled = sum
        .add(&e21.multiply(&Operand::Scalar(q(-1))).into())
        .and_then(|s| s.add(&e12.multiply(&Operand::Scalar(q(-1))).into()))
        .unwrap();
    assert!(cancelled.is_zero());

    assert!(matches!(
        sum.add(&e1),
        Err(ContractionError::UnsupportedOperand { .. })
    ));
    assert_eq!(
        sum.multiply(&e1).add(&sum.clone().into()),
        Err(ContractionError::RankMismatch { left: 3, right: 2 })
    );
}

#[test]
fn symmetric_traces() {
    init();
    let u = constant("u", &[1, 2, 0]);
    let v = constant("v", &[0, 1, 1]);
    let c = Rational64::new(3, 4);
    let p = TensorProduct::new_symmetric(vec![u.clone(), v.clone()]).with_coefficient(c);
    assert_eq!(p.trace(0, 1), Ok(Value::Scalar(c * u.dot(&v).unwrap())));

    let t = Tensor::new(vec![
        TensorProduct::new_symmetric(vec![u.clone(), v.clone(), u.clone()]),
        TensorProduct::new_symmetric(vec![v.clone(), u.clone(), u.clone()]).with_coefficient(q(-1)),
    ])
    .unwrap();
    assert_eq!(t.compress(), Value::Scalar(q(0)));
}

#[test]
fn naming_helpers() {
    let mut name = "V".to_owned();
    for order in 1..=4 {
        name = bump_derivative(&name, "t");
        assert_eq!(name.matches(r"\partial_t").count(), 1);
        if order > 1 {
            assert!(name.contains(&format!("^{{{order}}}")));
        }
    }
    assert_eq!(delimit("a+b", false), "(a+b)");
    assert_eq!(delimit("(a+b)*c", false), "[ (a+b)*c ]");
}

/// Polynomial in `t` with rational coefficients, lowest degree first.
#[derive(Debug, Clone, PartialEq)]
struct Poly(Vec<Rational64>);

impl Poly {
    fn new(mut coefficients: Vec<Rational64>) -> Self {
        while coefficients.last().is_some_and(Zero::is_zero) {
            coefficients.pop();
        }
        Poly(coefficients)
    }

    fn constant(c: i64) -> Self {
        Poly::new(vec![q(c)])
    }

    /// `c · t^degree`
    fn monomial(c: i64, degree: usize) -> Self {
        let mut coefficients = vec![q(0); degree + 1];
        coefficients[degree] = q(c);
        Poly::new(coefficients)
    }

    fn zip_with(self, other: Self, f: impl Fn(Rational64, Rational64) -> Rational64) -> Self {
        let len = self.0.len().max(other.0.len());
        let at = |p: &Poly, i: usize| p.0.get(i).copied().unwrap_or_else(|| q(0));
        Poly::new((0..len).map(|i| f(at(&self, i), at(&other, i))).collect())
    }
}

impl Add for Poly {
    type Output = Poly;
    fn add(self, rhs: Self) -> Poly {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for Poly {
    type Output = Poly;
    fn sub(self, rhs: Self) -> Poly {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Mul for Poly {
    type Output = Poly;
    fn mul(self, rhs: Self) -> Poly {
        if self.0.is_empty() || rhs.0.is_empty() {
            return Poly(vec![]);
        }
        let mut coefficients = vec![q(0); self.0.len() + rhs.0.len() - 1];
        for (i, a) in self.0.iter().enumerate() {
            for (j, b) in rhs.0.iter().enumerate() {
                coefficients[i + j] += a * b;
            }
        }
        Poly::new(coefficients)
    }
}

impl Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "0");
        }
        let terms = self
            .0
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| !Zero::is_zero(*c))
            .map(|(degree, c)| match degree {
                0 => format!("{c}"),
                1 => format!("{c}t"),
                _ => format!("{c}t^{degree}"),
            })
            .collect::<Vec<_>>();
        write!(f, "{}", terms.join("+"))
    }
}

impl Scalar for Poly {
    fn zero() -> Self {
        Poly(vec![])
    }

    fn one() -> Self {
        Poly::constant(1)
    }

    fn from_ratio(numerator: i64, denominator: i64) -> Self {
        Poly::new(vec![Rational64::new(numerator, denominator)])
    }

    fn simplify(&self) -> Self {
        Poly::new(self.0.clone())
    }

    fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    fn derivative(&self, parameter: &str) -> Self {
        if parameter != "t" {
            return Poly::zero();
        }
        Poly::new(
            self.0
                .iter()
                .enumerate()
                .skip(1)
                .map(|(degree, c)| c * q(degree as i64))
                .collect(),
        )
    }

    fn typeset(&self) -> String {
        self.to_string()
    }
}

/// `(t, 1, t^2)`
fn moving(name: &str) -> Vector<Poly> {
    Vector::function(
        name,
        vec![Poly::monomial(1, 1), Poly::constant(1), Poly::monomial(1, 2)],
    )
}

fn fixed(name: &str, components: [i64; 3]) -> Vector<Poly> {
    Vector::constant(name, components.into_iter().map(Poly::constant).collect())
}

#[test]
fn vector_derivatives() {
    let v = moving("v");
    let dv = v.differentiate("t");
    assert_eq!(dv.name(), r"\partial_t v");
    assert_eq!(
        dv.components(),
        &[Poly::constant(1), Poly::zero(), Poly::monomial(2, 1)]
    );
    let ddv = dv.differentiate("t");
    assert_eq!(ddv.name(), r"\partial_t^{2} v");
    assert_eq!(ddv.components()[2], Poly::constant(2));
    assert!(v.differentiate("x").is_zero());

    let e = fixed("e", [1, 0, 0]);
    assert_eq!(e.dot(&v), Ok(Poly::monomial(1, 1)));
    assert_eq!(e.dot(&dv), Ok(Poly::constant(1)));
}

#[test]
fn product_rule_with_constant_factor() {
    init();
    let v = moving("v");
    let w = fixed("w", [0, 1, 0]);
    let d = v.tensor(&w).differentiate("t");
    let expected = Tensor::new(vec![TensorProduct::new(vec![v.differentiate("t"), w])]).unwrap();
    assert_eq!(d, Value::Tensor(expected));
}

#[test]
fn product_rule_over_every_factor() {
    init();
    let v = moving("v");
    let dv = v.differentiate("t");
    let p = v.tensor(&v).with_coefficient(Poly::monomial(3, 1));
    let d = p.differentiate("t").try_into_tensor().unwrap();
    assert_eq!(
        d.terms(),
        &[
            TensorProduct::new(vec![v.clone(), v.clone()]).with_coefficient(Poly::constant(3)),
            TensorProduct::new(vec![dv.clone(), v.clone()]).with_coefficient(Poly::monomial(3, 1)),
            TensorProduct::new(vec![v.clone(), dv.clone()]).with_coefficient(Poly::monomial(3, 1)),
        ]
    );
    insta::assert_snapshot!(
        d.to_string(),
        @r"{ [ (3)*v*v ] + [ (3t)*\partial_t v*v ] + [ (3t)*v*\partial_t v ] }"
    );

    let symmetric = TensorProduct::new_symmetric(vec![v.clone(), v.clone()]);
    let d = symmetric.differentiate("t").try_into_tensor().unwrap();
    assert_eq!(
        d.terms(),
        &[TensorProduct::new_symmetric(vec![dv, v]).with_coefficient(Poly::constant(2))]
    );
}

#[test]
fn tensor_derivative_drops_constants() {
    init();
    let v = moving("v");
    let e = fixed("e", [1, 0, 0]);
    let t = Tensor::new(vec![
        e.tensor(&e).with_coefficient(Poly::monomial(1, 2)),
        v.tensor(&e),
        e.tensor(&e).with_coefficient(Poly::constant(5)),
    ])
    .unwrap();
    let d = t.differentiate("t").try_into_tensor().unwrap();
    assert_eq!(
        d.terms(),
        &[
            e.tensor(&e).with_coefficient(Poly::monomial(2, 1)),
            v.differentiate("t").tensor(&e),
        ]
    );

    let contracted = d.contract(&e.tensor(&e)).unwrap();
    assert_eq!(contracted, Poly::monomial(2, 1) + Poly::constant(1));
    assert!(t.differentiate("x").is_zero());
}

#[test]
fn typeset_polynomials() {
    let v = moving("v");
    let p = v.tensor(&v).with_coefficient(Poly::monomial(2, 1));
    insta::assert_snapshot!(p.typeset(), @r"\left[ \left(2t\right)\, v \otimes v \right]");
    assert_eq!(Operand::from(p.clone()).typeset(), p.typeset());
}
