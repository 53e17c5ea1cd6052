use alm_core::{Observer, Problem};
use tracing::{debug, info, warn};

use super::{
    Action, AlmParams, Error, Event, InnerSolver, InnerStatus, Solution, Status, state::State,
};

pub(super) fn solve<P, S, Obs>(
    problem: &P,
    inner: &mut S,
    x0: &[f64],
    y0: &[f64],
    params: &AlmParams,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    P: Problem + ?Sized,
    S: InnerSolver,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    params.verify()?;
    check_len("x0", x0.len(), problem.n())?;
    check_len("y0", y0.len(), problem.m())?;

    let mut state = State::new(problem, params, x0, y0)?;
    info!(
        n = problem.n(),
        m = problem.m(),
        sigma0 = state.sigma.first().copied(),
        "starting augmented Lagrangian solve"
    );

    for iter in 0..params.max_iter {
        let outer_iterations = iter + 1;

        let inner_solution =
            inner.solve(problem, &state.sigma, state.epsilon, &mut state.x, &state.y)?;
        state.inner_iterations += inner_solution.iterations;

        if inner_solution.status == InnerStatus::NotFinite {
            warn!(iteration = iter, "inner solver hit a non-finite value");
            return Ok(state.into_solution(Status::Failed, outer_iterations));
        }

        state.update_multipliers(problem, params)?;
        debug!(
            iteration = iter,
            norm_e = state.norm_e,
            epsilon = state.epsilon,
            stationarity = inner_solution.stationarity,
            inner_status = ?inner_solution.status,
            inner_iterations = inner_solution.iterations,
            "outer iteration"
        );

        let event = Event {
            iteration: iter,
            x: &state.x,
            y: &state.y,
            sigma: &state.sigma,
            norm_e: state.norm_e,
            epsilon: state.epsilon,
            inner: inner_solution,
        };
        let action = observer.observe(&event);

        if state.norm_e <= params.delta && inner_solution.stationarity <= params.epsilon {
            info!(
                outer_iterations,
                inner_iterations = state.inner_iterations,
                norm_e = state.norm_e,
                "converged"
            );
            return Ok(state.into_solution(Status::Converged, outer_iterations));
        }
        if action == Some(Action::StopEarly) {
            info!(iteration = iter, "stopped by observer");
            let status = Status::StoppedByObserver;
            return Ok(state.into_solution(status, outer_iterations));
        }
        if state.elapsed() >= params.max_time {
            warn!(iteration = iter, "time limit reached");
            return Ok(state.into_solution(Status::MaxTime, outer_iterations));
        }

        state.update_penalty(params, iter == 0);
        state.epsilon = (params.tolerance_update_factor * state.epsilon).max(params.epsilon);
    }

    warn!(max_iter = params.max_iter, "iteration limit reached");
    Ok(state.into_solution(Status::MaxIter, params.max_iter))
}

fn check_len(name: &str, len: usize, expected: usize) -> Result<(), Error> {
    if len == expected {
        Ok(())
    } else {
        Err(alm_core::Error::invalid_argument(format!(
            "{name} has length {len} but the problem expects {expected}"
        ))
        .into())
    }
}
