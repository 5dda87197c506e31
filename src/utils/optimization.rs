//! Derivative-free minimization for coefficient estimation.

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Options for the Nelder-Mead minimizer.
#[derive(Debug, Clone)]
pub struct OptimizerOptions {
    /// Hard iteration cap; exceeding it is a non-fatal stop.
    pub max_iterations: usize,
    /// Convergence threshold on the relative spread of objective values.
    pub tolerance: f64,
    /// Step used to build the initial simplex around the starting point.
    pub initial_step: f64,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-6,
            initial_step: 0.1,
        }
    }
}

/// Outcome of a minimization run, including convergence diagnostics.
#[derive(Debug, Clone)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Minimize `objective` with the Nelder-Mead simplex method.
///
/// `bounds` must have one `(min, max)` pair per dimension; use infinities for
/// unconstrained dimensions. The best iterate found is always returned, with
/// `converged = false` when the iteration cap was hit first. Deterministic
/// for a fixed starting point.
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: &[(f64, f64)],
    options: &OptimizerOptions,
) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let dim = initial.len();
    debug_assert_eq!(bounds.len(), dim);
    if dim == 0 {
        return Minimum {
            point: vec![],
            value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let clamp = |point: &mut Vec<f64>| {
        for (x, &(lo, hi)) in point.iter_mut().zip(bounds) {
            *x = x.clamp(lo, hi);
        }
    };

    // Initial simplex: the start plus one vertex stepped along each axis.
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(dim + 1);
    simplex.push((initial.to_vec(), objective(initial)));
    for axis in 0..dim {
        let mut vertex = initial.to_vec();
        vertex[axis] += if initial[axis].abs() > 1e-10 {
            options.initial_step * initial[axis].abs()
        } else {
            options.initial_step
        };
        clamp(&mut vertex);
        let value = objective(&vertex);
        simplex.push((vertex, value));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        iterations += 1;
        simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let best = simplex[0].1;
        let worst = simplex[dim].1;
        if (worst - best).abs() <= options.tolerance * (best.abs() + options.tolerance) {
            converged = true;
            break;
        }

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; dim];
        for (vertex, _) in &simplex[..dim] {
            for (c, x) in centroid.iter_mut().zip(vertex) {
                *c += x;
            }
        }
        for c in &mut centroid {
            *c /= dim as f64;
        }

        let towards = |coeff: f64, from: &[f64]| -> Vec<f64> {
            let mut point: Vec<f64> = centroid
                .iter()
                .zip(from)
                .map(|(c, x)| c + coeff * (c - x))
                .collect();
            clamp(&mut point);
            point
        };

        let reflected = towards(REFLECT, &simplex[dim].0);
        let reflected_value = objective(&reflected);

        if reflected_value < simplex[0].1 {
            // Try to go further in the same direction.
            let expanded = towards(EXPAND, &simplex[dim].0);
            let expanded_value = objective(&expanded);
            simplex[dim] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
            continue;
        }

        if reflected_value < simplex[dim - 1].1 {
            simplex[dim] = (reflected, reflected_value);
            continue;
        }

        let contracted = if reflected_value < simplex[dim].1 {
            towards(REFLECT * CONTRACT, &simplex[dim].0)
        } else {
            towards(-CONTRACT, &simplex[dim].0)
        };
        let contracted_value = objective(&contracted);
        if contracted_value < simplex[dim].1.min(reflected_value) {
            simplex[dim] = (contracted, contracted_value);
            continue;
        }

        // Shrink everything towards the best vertex.
        let anchor = simplex[0].0.clone();
        for (vertex, value) in simplex.iter_mut().skip(1) {
            for (x, a) in vertex.iter_mut().zip(&anchor) {
                *x = a + SHRINK * (*x - a);
            }
            clamp(vertex);
            *value = objective(vertex);
        }
    }

    simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let (point, value) = simplex.swap_remove(0);
    Minimum {
        point,
        value,
        iterations,
        converged,
    }
}
