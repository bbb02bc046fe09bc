//! Derivative-free minimization for model parameter estimation.

/// Options for the Nelder-Mead simplex search.
#[derive(Debug, Clone)]
pub struct SimplexOptions {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on the simplex value spread.
    pub tolerance: f64,
    /// Relative step used to seed the initial simplex.
    pub initial_step: f64,
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            initial_step: 0.05,
        }
    }
}

/// Outcome of a simplex minimization.
#[derive(Debug, Clone)]
pub struct SimplexOutcome {
    /// Best point found.
    pub point: Vec<f64>,
    /// Objective value at the best point.
    pub value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the value spread fell below tolerance.
    pub converged: bool,
}

// Standard Nelder-Mead coefficients.
const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimize `objective` with the Nelder-Mead simplex method.
///
/// `bounds`, when given, clamps every evaluated point componentwise.
pub fn minimize<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    options: &SimplexOptions,
) -> SimplexOutcome
where
    F: Fn(&[f64]) -> f64,
{
    let dim = initial.len();
    if dim == 0 {
        return SimplexOutcome {
            point: vec![],
            value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let clamp = |point: Vec<f64>| -> Vec<f64> {
        match bounds {
            Some(bounds) => point
                .into_iter()
                .zip(bounds)
                .map(|(v, &(lo, hi))| v.clamp(lo, hi))
                .collect(),
            None => point,
        }
    };

    // Seed the simplex: the initial point plus one perturbed vertex per axis.
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(dim + 1);
    let start = clamp(initial.to_vec());
    let start_value = objective(&start);
    simplex.push((start.clone(), start_value));
    for axis in 0..dim {
        let mut vertex = start.clone();
        let step = if vertex[axis].abs() > 1e-10 {
            options.initial_step * vertex[axis].abs()
        } else {
            options.initial_step
        };
        vertex[axis] += step;
        let vertex = clamp(vertex);
        let value = objective(&vertex);
        simplex.push((vertex, value));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iter {
        iterations += 1;
        simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let spread = simplex[dim].1 - simplex[0].1;
        if spread.abs() < options.tolerance {
            converged = true;
            break;
        }

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; dim];
        for (vertex, _) in simplex.iter().take(dim) {
            for (c, v) in centroid.iter_mut().zip(vertex) {
                *c += v / dim as f64;
            }
        }

        let worst = simplex[dim].clone();
        let direction: Vec<f64> = centroid
            .iter()
            .zip(&worst.0)
            .map(|(c, w)| c - w)
            .collect();

        let at = |scale: f64| -> Vec<f64> {
            clamp(
                centroid
                    .iter()
                    .zip(&direction)
                    .map(|(c, d)| c + scale * d)
                    .collect(),
            )
        };

        let reflected = at(REFLECT);
        let reflected_value = objective(&reflected);

        if reflected_value < simplex[0].1 {
            let expanded = at(EXPAND);
            let expanded_value = objective(&expanded);
            simplex[dim] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
        } else if reflected_value < simplex[dim - 1].1 {
            simplex[dim] = (reflected, reflected_value);
        } else {
            let contracted = at(-CONTRACT);
            let contracted_value = objective(&contracted);
            if contracted_value < worst.1 {
                simplex[dim] = (contracted, contracted_value);
            } else {
                // Shrink every vertex toward the best one.
                let best = simplex[0].0.clone();
                for entry in simplex.iter_mut().skip(1) {
                    let shrunk: Vec<f64> = entry
                        .0
                        .iter()
                        .zip(&best)
                        .map(|(v, b)| b + SHRINK * (v - b))
                        .collect();
                    let shrunk = clamp(shrunk);
                    let value = objective(&shrunk);
                    *entry = (shrunk, value);
                }
            }
        }
    }

    simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let (point, value) = simplex.swap_remove(0);
    SimplexOutcome {
        point,
        value,
        iterations,
        converged,
    }
}
