use log::debug;
use rayon::prelude::*;

/// Runs `f` for every item on the rayon pool and keeps the successes.
///
/// Failures are dropped one by one, they never cancel the other items.
/// Output order follows input order.
pub fn fan_out<T, R, F>(items: &[T], f: F) -> Vec<(T, R)>
where
    T: Clone + Send + Sync + std::fmt::Display,
    R: Send,
    F: Fn(&T) -> anyhow::Result<R> + Send + Sync,
{
    items
        .par_iter()
        .filter_map(|item| match f(item) {
            Ok(value) => Some((item.clone(), value)),
            Err(err) => {
                debug!("{}: dropped: {:#}", item, err);
                None
            }
        })
        .collect()
}
