pub mod date;
mod fan_out;

pub use fan_out::fan_out;

pub trait FanOut {
    type Item;

    fn fan_out<R, F>(&self, f: F) -> Vec<(Self::Item, R)>
    where
        R: Send,
        F: Fn(&Self::Item) -> anyhow::Result<R> + Send + Sync;
}

impl<T> FanOut for [T]
where
    T: Clone + Send + Sync + std::fmt::Display,
{
    type Item = T;

    fn fan_out<R, F>(&self, f: F) -> Vec<(Self::Item, R)>
    where
        R: Send,
        F: Fn(&Self::Item) -> anyhow::Result<R> + Send + Sync,
    {
        fan_out(self, f)
    }
}
