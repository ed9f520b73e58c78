use crate::concurrency::Error;

/// Outcomes of a batch, aligned by position with the units that produced them. Every slot
/// holds exactly one of a value or an error.
#[derive(Debug)]
pub struct Outcomes<T, E> {
    slots: Vec<Result<T, Error<E>>>,
}

impl<T, E> Outcomes<T, E> {
    pub(crate) fn new(slots: Vec<Result<T, Error<E>>>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the outcome of the unit at `index`
    pub fn get(&self, index: usize) -> Option<Result<&T, &Error<E>>> {
        self.slots.get(index).map(Result::as_ref)
    }

    /// Values by position, `None` where the unit failed or timed out
    pub fn values(&self) -> impl Iterator<Item = Option<&T>> {
        self.slots.iter().map(|slot| slot.as_ref().ok())
    }

    /// Errors by position, `None` where the unit succeeded
    pub fn errors(&self) -> impl Iterator<Item = Option<&Error<E>>> {
        self.slots.iter().map(|slot| slot.as_ref().err())
    }

    /// Positions of the units that were recorded as timed out
    pub fn timed_out(&self) -> Vec<usize> {
        self.errors()
            .enumerate()
            .filter_map(|(index, error)| error.filter(|e| e.is_timeout()).map(|_| index))
            .collect()
    }

    /// Split the outcomes into the two position-aligned value and error sequences
    pub fn into_parts(self) -> (Vec<Option<T>>, Vec<Option<Error<E>>>) {
        let mut values = Vec::with_capacity(self.slots.len());
        let mut errors = Vec::with_capacity(self.slots.len());

        for slot in self.slots {
            match slot {
                Ok(value) => {
                    values.push(Some(value));
                    errors.push(None);
                },
                Err(error) => {
                    values.push(None);
                    errors.push(Some(error));
                },
            }
        }

        (values, errors)
    }

    pub fn into_results(self) -> Vec<Result<T, Error<E>>> {
        self.slots
    }
}

impl<T, E> IntoIterator for Outcomes<T, E> {
    type Item = Result<T, Error<E>>;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}
