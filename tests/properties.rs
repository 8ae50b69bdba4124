//! Cross-module properties of the matrix, polynomial and Markov chain engines.

use num_traits::Zero;
use rust_math::{ClassKind, Error, Fraction, MarkovChain, Matrix, Polynomial, Vector};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fr(s: &str) -> Fraction {
    s.parse().unwrap()
}

fn frac_matrix(lines: &[&[i64]]) -> Matrix<Fraction> {
    Matrix::from_list(
        lines
            .iter()
            .map(|l| l.iter().map(|&x| Fraction::from(x)).collect())
            .collect(),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

#[test]
fn inverse_round_trips_to_identity() {
    init_logging();
    let matrices = [
        frac_matrix(&[&[1, 2], &[3, 4]]),
        frac_matrix(&[&[0, 0, 1], &[0, 2, 0], &[3, 0, 0]]),
        frac_matrix(&[&[2, -1, 0, 1], &[1, 3, 2, 0], &[0, 1, 1, 4], &[5, 0, -2, 1]]),
        frac_matrix(&[&[7]]),
    ];
    for m in matrices {
        assert_ne!(m.determinant().unwrap(), Fraction::from(0));
        let n = m.rows();
        let inv = m.inverse().unwrap();
        assert_eq!((&m * &inv).unwrap(), Matrix::identity(n));
        assert_eq!((&inv * &m).unwrap(), Matrix::identity(n));
    }
}

#[test]
fn documented_two_by_two_example() {
    let m = frac_matrix(&[&[1, 2], &[3, 4]]);
    assert_eq!(m.determinant().unwrap(), Fraction::from(-2));
    assert_eq!(
        m.inverse().unwrap(),
        Matrix::from_list(vec![vec![fr("-2"), fr("1")], vec![fr("3/2"), fr("-1/2")]]).unwrap()
    );
}

#[test]
fn power_composition() {
    let m = frac_matrix(&[&[1, 2, 0], &[0, 1, 3], &[1, 0, 1]]);
    for a in 0..4 {
        for b in 0..4 {
            let lhs = m.power(a + b).unwrap();
            let rhs = (&m.power(a).unwrap() * &m.power(b).unwrap()).unwrap();
            assert_eq!(lhs, rhs, "a = {}, b = {}", a, b);
        }
    }
}

#[test]
fn characteristic_polynomial_roots_are_eigenvalues() {
    let matrices = [
        frac_matrix(&[&[2, 0], &[0, 3]]),
        frac_matrix(&[&[4, 1], &[2, 3]]),
        frac_matrix(&[&[2, 0, 0], &[1, -1, 0], &[0, 4, 5]]),
    ];
    for m in matrices {
        let poly = m.characteristic_polynomial().unwrap();
        let roots = poly.rough_roots();
        assert!(!roots.is_empty());
        for root in roots {
            assert!(
                poly.evaluate_f64(root).abs() < 0.1,
                "p({}) = {}",
                root,
                poly.evaluate_f64(root)
            );
        }
    }
}

#[test]
fn symbolic_entries_share_the_determinant() {
    // A matrix of polynomials is itself a valid matrix.
    let x = Polynomial::new(vec![0i64, 1]);
    let one = Polynomial::new(vec![1i64]);
    let m = Matrix::from_list(vec![vec![x.clone(), one.clone()], vec![one, x]]).unwrap();
    assert_eq!(m.determinant().unwrap(), Polynomial::new(vec![-1, 0, 1]));
}

// ---------------------------------------------------------------------------
// Polynomial
// ---------------------------------------------------------------------------

#[test]
fn division_round_trip() {
    let cases: [(&[&str], &[&str]); 4] = [
        (&["1", "-3", "2"], &["-1", "1"]),
        (&["5", "0", "0", "0", "1"], &["1", "0", "2"]),
        (&["1/2", "7", "-3"], &["3"]),
        (&["4", "1"], &["0", "0", "1"]),
    ];
    for (a, b) in cases {
        let a = Polynomial::new(a.iter().map(|c| fr(c)).collect());
        let b = Polynomial::new(b.iter().map(|c| fr(c)).collect());
        let (q, r) = a.div_rem(&b).unwrap();
        assert_eq!(&(&q * &b) + &r, a);
        assert!(r.is_zero() || r.degree() < b.degree());
    }
}

#[test]
fn documented_rough_roots_example() {
    let roots = Polynomial::new(vec![1i64, -3, 2]).rough_roots();
    assert_eq!(roots.len(), 2);
    assert!((roots[0] - 0.5).abs() < 1e-2);
    assert!((roots[1] - 1.0).abs() < 1e-2);
}

// ---------------------------------------------------------------------------
// Markov chain
// ---------------------------------------------------------------------------

#[test]
fn rows_must_sum_to_one() {
    let p = Matrix::from_list(vec![vec![0.5f64, 0.4], vec![0.5, 0.5]]).unwrap();
    let p0 = Vector::new(vec![0.5f64, 0.5]).unwrap();
    assert!(matches!(MarkovChain::new(p, p0), Err(Error::Construction(_))));
}

#[test]
fn flip_flop_is_one_recurrent_class() {
    init_logging();
    let p = frac_matrix(&[&[0, 1], &[1, 0]]);
    let chain = MarkovChain::uniform(p).unwrap();
    let classes = chain.classes();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].states, vec![0, 1]);
    assert_eq!(classes[0].kind, ClassKind::Recurrent);
}

#[test]
fn uniform_mixing_converges_immediately() {
    let p = Matrix::from_list(vec![
        vec![fr("1/2"), fr("1/2")],
        vec![fr("1/2"), fr("1/2")],
    ])
    .unwrap();
    for p0 in [["1", "0"], ["0", "1"], ["1/3", "2/3"]] {
        let p0 = Vector::new(p0.iter().map(|c| fr(c)).collect()).unwrap();
        let chain = MarkovChain::new(p.clone(), p0).unwrap();
        for n in 1..6 {
            assert_eq!(
                chain.prob(n).unwrap(),
                Vector::new(vec![fr("1/2"), fr("1/2")]).unwrap()
            );
        }
    }
}

#[test]
fn repeated_horizons_agree() {
    let p = Matrix::from_list(vec![
        vec![fr("1/3"), fr("2/3"), fr("0")],
        vec![fr("0"), fr("1/2"), fr("1/2")],
        vec![fr("1"), fr("0"), fr("0")],
    ])
    .unwrap();
    let chain = MarkovChain::uniform(p.clone()).unwrap();
    for n in [4u32, 2, 4, 9, 3, 9] {
        let expected = p.power(n as i32).unwrap().at(2, 1);
        assert_eq!(chain.prob_xy(2, 1, n).unwrap(), expected);
    }
}
