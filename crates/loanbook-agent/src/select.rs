//! Exactly-one selection over records returned by a list flow.
//!
//! Every route that acts on one loan or one account first lists candidates,
//! then narrows them with [`select_single`]. Zero matches and several matches
//! are both errors; a duplicate is never resolved by taking the first.

/// Why a selection did not yield exactly one record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("no {what} matches")]
    NotFound { what: String },

    #[error("{count} {what} records match, expected exactly one")]
    Ambiguous { what: String, count: usize },
}

/// Return the single item of `items` satisfying `predicate`.
///
/// `what` describes the sought record in error messages,
/// e.g. `"loan at 9F86…(0)"`.
pub fn select_single<'a, T, P>(
    items: &'a [T],
    predicate: P,
    what: impl Into<String>,
) -> Result<&'a T, SelectionError>
where
    P: Fn(&T) -> bool,
{
    let mut matches = items.iter().filter(|item| predicate(*item));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(only),
        (None, _) => Err(SelectionError::NotFound { what: what.into() }),
        (Some(_), Some(_)) => Err(SelectionError::Ambiguous {
            what: what.into(),
            count: 2 + matches.count(),
        }),
    }
}
