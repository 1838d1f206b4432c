use serde::{Deserialize, Serialize};

/// Rating aggregate for one book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub avg: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub count: u64,
    /// The current device's rating, 0 when the source doesn't know it.
    #[serde(default, deserialize_with = "zero_if_null")]
    pub mine: u8,
}

fn zero_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::Summary;

    #[test]
    fn null_and_missing_fields_are_zero() -> anyhow::Result<()> {
        let summary: Summary = serde_json::from_str(r#"{"avg": null}"#)?;

        assert_eq!(Summary::default(), summary);

        let summary: Summary = serde_json::from_str(r#"{"avg": 4.5, "count": 2}"#)?;

        assert_eq!(4.5, summary.avg);
        assert_eq!(2, summary.count);
        assert_eq!(0, summary.mine);

        Ok(())
    }
}
