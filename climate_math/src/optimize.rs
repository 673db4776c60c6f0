//! Derivative-free minimisation
//!
//! A Nelder-Mead simplex search used to estimate model parameters when the
//! objective has no closed-form gradient.

use crate::{MathError, Result};
use log::debug;

/// Settings for the Nelder-Mead simplex search
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Convergence tolerance on the spread of objective values
    pub f_tolerance: f64,
    /// Convergence tolerance on the simplex diameter
    pub x_tolerance: f64,
    /// Size of the initial simplex step along each axis
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 5_000,
            f_tolerance: 1e-10,
            x_tolerance: 1e-8,
            initial_step: 0.1,
        }
    }
}

/// Outcome of a simplex search
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether both tolerances were met before `max_iter`
    pub converged: bool,
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimise `objective` starting from `initial`
///
/// Non-finite objective values are treated as `+inf`, which lets callers
/// reject infeasible regions by returning `f64::INFINITY`.
pub fn nelder_mead<F>(
    mut objective: F,
    initial: &[f64],
    config: &NelderMeadConfig,
) -> Result<NelderMeadResult>
where
    F: FnMut(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return Err(MathError::InvalidInput(
            "Nelder-Mead needs at least one parameter".to_string(),
        ));
    }

    let mut eval = |x: &[f64]| {
        let v = objective(x);
        if v.is_finite() {
            v
        } else {
            f64::INFINITY
        }
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(initial.to_vec());
    for i in 0..n {
        let mut vertex = initial.to_vec();
        let step = if vertex[i].abs() > 1e-8 {
            config.initial_step * vertex[i].abs()
        } else {
            config.initial_step
        };
        vertex[i] += step;
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    if values[0].is_infinite() {
        return Err(MathError::CalculationError(
            "Objective is not finite at the starting point".to_string(),
        ));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        // Order vertices from best to worst
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let f_spread = (values[n] - values[0]).abs();
        let x_spread = simplex[1..]
            .iter()
            .flat_map(|v| v.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);

        if f_spread <= config.f_tolerance * (1.0 + values[0].abs())
            && x_spread <= config.x_tolerance * (1.0 + max_abs(&simplex[0]))
        {
            converged = true;
            break;
        }

        iterations += 1;

        let centroid: Vec<f64> = (0..n)
            .map(|j| simplex[..n].iter().map(|v| v[j]).sum::<f64>() / n as f64)
            .collect();
        let worst = simplex[n].clone();

        let reflected = along(&centroid, &worst, REFLECTION);
        let f_reflected = eval(&reflected);

        if f_reflected < values[0] {
            let expanded = along(&centroid, &worst, EXPANSION);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                simplex[n] = expanded;
                values[n] = f_expanded;
            } else {
                simplex[n] = reflected;
                values[n] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[n - 1] {
            simplex[n] = reflected;
            values[n] = f_reflected;
            continue;
        }

        // Contract towards the better of the reflected and worst points
        let (contracted, f_contracted) = if f_reflected < values[n] {
            let c = along(&centroid, &worst, CONTRACTION);
            let f = eval(&c);
            (c, f)
        } else {
            let c = along(&centroid, &worst, -CONTRACTION);
            let f = eval(&c);
            (c, f)
        };

        if f_contracted < values[n].min(f_reflected) {
            simplex[n] = contracted;
            values[n] = f_contracted;
            continue;
        }

        // Shrink every vertex towards the best one
        let best = simplex[0].clone();
        for i in 1..=n {
            simplex[i] = best
                .iter()
                .zip(&simplex[i])
                .map(|(b, x)| b + SHRINK * (x - b))
                .collect();
            values[i] = eval(&simplex[i]);
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0);

    debug!(
        "nelder-mead finished after {} iterations (converged: {}, value: {:.6e})",
        iterations, converged, values[best]
    );

    Ok(NelderMeadResult {
        point: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    })
}

/// `centroid + coefficient * (centroid - worst)`
fn along(centroid: &[f64], worst: &[f64], coefficient: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(worst)
        .map(|(c, w)| c + coefficient * (c - w))
        .collect()
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().map(|v| v.abs()).fold(0.0, f64::max)
}
