use crate::config::ChainConfig;
use crate::error::{Error, Result};
use crate::matrix::matrix::Matrix;
use crate::matrix::power_cache::PowerCache;
use crate::matrix::vector::{Norm, Vector};
use crate::rings::fraction::Fraction;
use crate::rings::scalar::{to_f64, RealScalar, Scalar};
use log::debug;
use num_traits::Zero;
use rand::Rng;
use std::cell::{OnceCell, RefCell};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Recurrent,
    Transient,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassKind::Recurrent => write!(f, "recurrent"),
            ClassKind::Transient => write!(f, "transient"),
        }
    }
}

/// Maximal set of mutually reachable states, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunicationClass {
    pub states: Vec<usize>,
    pub kind: ClassKind,
}

impl CommunicationClass {
    pub fn contains(&self, state: usize) -> bool {
        self.states.contains(&state)
    }

    pub fn is_recurrent(&self) -> bool {
        self.kind == ClassKind::Recurrent
    }
}

/// Discrete-time Markov chain over states `0..n`.
///
/// The transition matrix `p` is never modified after construction: the
/// cached `classes` and matrix powers rely on it. Only `state` changes.
#[derive(Debug)]
pub struct MarkovChain<T> {
    p: Matrix<T>,
    p0: Vector<T>,
    state: usize,
    config: ChainConfig,
    powers: RefCell<PowerCache<T>>,
    classes: OnceCell<Vec<CommunicationClass>>,
}

impl<T: RealScalar> MarkovChain<T> {
    pub fn new(p: Matrix<T>, p0: Vector<T>) -> Result<MarkovChain<T>> {
        MarkovChain::with_config(p, p0, ChainConfig::default())
    }

    /// Chain starting from the uniform distribution. The generated `1/n`
    /// weights are not held to an exact unit sum, which floats can miss.
    pub fn uniform(p: Matrix<T>) -> Result<MarkovChain<T>> {
        let config = ChainConfig::default();
        validate_transitions(&p, &config)?;

        let n = p.rows();
        let count = T::from_usize(n)
            .ok_or_else(|| Error::Construction(format!("{} states not representable", n)))?;
        let p0 = Vector::new(vec![T::one() / count; n])
            .map_err(|_| Error::Construction("transition matrix has no states".into()))?;
        Ok(MarkovChain::assemble(p, p0, config))
    }

    pub fn with_config(
        p: Matrix<T>,
        p0: Vector<T>,
        config: ChainConfig,
    ) -> Result<MarkovChain<T>> {
        validate_transitions(&p, &config)?;
        validate_initial(&p0, p.rows())?;
        Ok(MarkovChain::assemble(p, p0, config))
    }

    fn assemble(p: Matrix<T>, p0: Vector<T>, config: ChainConfig) -> MarkovChain<T> {
        debug!("markov chain with {} states", p.rows());

        let mut chain = MarkovChain {
            p,
            p0,
            state: 0,
            config,
            powers: RefCell::new(PowerCache::new(config.power_cache_capacity)),
            classes: OnceCell::new(),
        };
        chain.restart();
        chain
    }

    /// Normalizes every row (and the initial weights, if given) to sum to one.
    /// Without initial weights the chain starts uniformly.
    pub fn from_unscaled_matrix(
        weights: &Matrix<T>,
        init: Option<&Vector<T>>,
    ) -> Result<MarkovChain<T>> {
        let rows = weights
            .iter_rows()
            .enumerate()
            .map(|(i, row)| {
                Vector::new(row.to_vec())?
                    .to_unit(Norm::One)
                    .map_err(|_| Error::Value(format!("row {} has zero total weight", i)))
            })
            .collect::<Result<Vec<_>>>()?;
        let p = Matrix::from_rows(rows)?;

        match init {
            Some(weights) => {
                let p0 = weights.to_unit(Norm::One).map_err(|_| {
                    Error::Value("initial weights have zero total weight".into())
                })?;
                MarkovChain::new(p, p0)
            }
            None => MarkovChain::uniform(p),
        }
    }

    pub fn transition_matrix(&self) -> &Matrix<T> {
        &self.p
    }

    pub fn initial_distribution(&self) -> &Vector<T> {
        &self.p0
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn n_states(&self) -> usize {
        self.p.rows()
    }

    pub fn state(&self) -> usize {
        self.state
    }

    /// Draws a new current state from the initial distribution.
    pub fn restart(&mut self) {
        self.restart_with(&mut rand::thread_rng());
    }

    pub fn restart_with<R: Rng>(&mut self, rng: &mut R) {
        self.state = pick(self.p0.as_slice(), rng);
    }

    /// Takes `n` steps and returns the state reached.
    pub fn next(&mut self, n: usize) -> usize {
        self.next_with(n, &mut rand::thread_rng())
    }

    pub fn next_with<R: Rng>(&mut self, n: usize, rng: &mut R) -> usize {
        for _ in 0..n {
            self.state = pick(self.p.row(self.state), rng);
        }
        self.state
    }

    /// Probability of going from `x` to `y` in `n` steps.
    pub fn prob_xy(&self, x: usize, y: usize, n: u32) -> Result<T> {
        self.check_state(x)?;
        self.check_state(y)?;
        Ok(self.power(n)?.at(x, y))
    }

    /// Distribution over all states after `n` steps.
    pub fn prob(&self, n: u32) -> Result<Vector<T>> {
        &self.power(n)?.transpose() * &self.p0
    }

    /// Probability of being in `x` after `n` steps.
    pub fn prob_x(&self, x: usize, n: u32) -> Result<T> {
        self.check_state(x)?;
        Ok(self.prob(n)?[x].clone())
    }

    /// `P(X_n = x | X_n2 = y)`, using Bayes' rule when `n < n2`.
    pub fn prob_xn_eq_x_given_xn2_eq_y(&self, n: u32, x: usize, n2: u32, y: usize) -> Result<T> {
        if n >= n2 {
            return self.prob_xy(y, x, n - n2);
        }
        let evidence = self.prob_x(y, n2)?;
        if evidence.is_zero() {
            return Err(Error::DivideByZero(format!(
                "state {} has probability zero at step {}",
                y, n2
            )));
        }
        Ok(self.prob_xy(y, x, n2 - n)? * self.prob_x(x, n)? / evidence)
    }

    /// Whether `j` can be reached from `i` through positive-probability steps.
    pub fn accessible(&self, i: usize, j: usize) -> Result<bool> {
        self.check_state(i)?;
        self.check_state(j)?;
        Ok(self.reachable_from(i)[j])
    }

    /// Communication classes, computed on first use.
    pub fn classes(&self) -> &[CommunicationClass] {
        self.classes.get_or_init(|| self.compute_classes())
    }

    pub fn class_of(&self, state: usize) -> Result<&CommunicationClass> {
        self.check_state(state)?;
        self.classes()
            .iter()
            .find(|c| c.contains(state))
            .ok_or_else(|| Error::Algorithm(format!("state {} belongs to no class", state)))
    }

    pub fn is_recurrent(&self, state: usize) -> Result<bool> {
        Ok(self.class_of(state)?.is_recurrent())
    }

    fn power(&self, n: u32) -> Result<Matrix<T>> {
        let exponent = i32::try_from(n)
            .map_err(|_| Error::Value(format!("{} steps is too many", n)))?;
        self.powers.borrow_mut().power(&self.p, exponent)
    }

    fn check_state(&self, state: usize) -> Result<()> {
        if state >= self.n_states() {
            return Err(Error::Value(format!(
                "state {} outside 0..{}",
                state,
                self.n_states()
            )));
        }
        Ok(())
    }

    fn reachable_from(&self, from: usize) -> Vec<bool> {
        let mut visited = vec![false; self.n_states()];
        let mut stack = vec![from];
        visited[from] = true;

        while let Some(k) = stack.pop() {
            for (next, p) in self.p.row(k).iter().enumerate() {
                if *p > T::zero() && !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
        visited
    }

    fn compute_classes(&self) -> Vec<CommunicationClass> {
        let n = self.n_states();
        let reach: Vec<Vec<bool>> = (0..n).map(|i| self.reachable_from(i)).collect();

        let mut class_of: Vec<Option<usize>> = vec![None; n];
        let mut members: Vec<Vec<usize>> = vec![];
        for i in 0..n {
            for j in i..n {
                if !(reach[i][j] && reach[j][i]) {
                    continue;
                }
                let class = match class_of[i] {
                    Some(class) => class,
                    None => {
                        members.push(vec![i]);
                        class_of[i] = Some(members.len() - 1);
                        members.len() - 1
                    }
                };
                if class_of[j].is_none() {
                    class_of[j] = Some(class);
                    members[class].push(j);
                }
            }
        }

        let classes: Vec<CommunicationClass> = members
            .into_iter()
            .map(|states| {
                let rep = states[0];
                // Closed iff everything reachable from the class leads back.
                let closed = (0..n).all(|k| !reach[rep][k] || reach[k][rep]);
                CommunicationClass {
                    states,
                    kind: if closed {
                        ClassKind::Recurrent
                    } else {
                        ClassKind::Transient
                    },
                }
            })
            .collect();
        debug!(
            "markov chain has {} communication classes, {} recurrent",
            classes.len(),
            classes.iter().filter(|c| c.is_recurrent()).count()
        );
        classes
    }
}

impl MarkovChain<Fraction> {
    /// Like `from_unscaled_matrix`, normalizing exactly from integer-like weights.
    pub fn from_unscaled_to_fraction<W: Scalar + Into<Fraction>>(
        weights: &Matrix<W>,
        init: Option<&Vector<W>>,
    ) -> Result<MarkovChain<Fraction>> {
        let exact: Matrix<Fraction> = weights.map(|w| w.clone().into());
        let init = init
            .map(|v| Vector::<Fraction>::new(v.iter().map(|w| w.clone().into()).collect()))
            .transpose()?;
        Self::from_unscaled_matrix(&exact, init.as_ref())
    }
}

fn validate_transitions<T: RealScalar>(p: &Matrix<T>, config: &ChainConfig) -> Result<()> {
    if !p.is_square() {
        return Err(Error::Construction(format!(
            "transition matrix must be square, got {}x{}",
            p.rows(),
            p.cols()
        )));
    }
    for (i, row) in p.iter_rows().enumerate() {
        if row.iter().any(|x| *x < T::zero() || *x > T::one()) {
            return Err(Error::Construction(format!(
                "row {} has an entry outside [0, 1]",
                i
            )));
        }
        let sum = to_f64(&row.iter().fold(T::zero(), |acc, x| acc + x.clone()));
        if !((sum - 1.0).abs() <= config.row_sum_tolerance) {
            return Err(Error::Construction(format!(
                "row {} sums to {}, expected 1",
                i, sum
            )));
        }
    }
    Ok(())
}

/// Caller-supplied initial distributions must sum to exactly one.
fn validate_initial<T: RealScalar>(p0: &Vector<T>, n_states: usize) -> Result<()> {
    if p0.len() != n_states {
        return Err(Error::Construction(format!(
            "{} initial probabilities for {} states",
            p0.len(),
            n_states
        )));
    }
    if p0.iter().any(|x| *x < T::zero()) {
        return Err(Error::Construction(
            "initial probabilities must be non-negative".into(),
        ));
    }
    if p0.sum() != T::one() {
        return Err(Error::Construction(format!(
            "initial probabilities sum to {}, expected 1",
            to_f64(&p0.sum())
        )));
    }
    Ok(())
}

/// Inverse-CDF sampling: the first index whose cumulative probability
/// exceeds a uniform draw in `[0, 1)`.
fn pick<T: RealScalar, R: Rng>(distribution: &[T], rng: &mut R) -> usize {
    let r: f64 = rng.gen();
    let mut cumulative = T::zero();
    for (i, p) in distribution.iter().enumerate() {
        cumulative = cumulative + p.clone();
        if r < to_f64(&cumulative) {
            return i;
        }
    }
    // Rounding left the draw above the total.
    distribution
        .iter()
        .rposition(|p| *p > T::zero())
        .unwrap_or(0)
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
