//! Purpose: Error-consumption policies for batch façade calls.
//! Exports: `BatchElementErrorPolicy`, `Default`, `Exception`, `Variant`, `ElementContext`.
//! Role: The policy tag chosen at the call site fixes the return shape of the call.
//! Invariants: Throwing policies report only the lowest-index element error.
//! Invariants: `Variant` never turns an element error into a call-level error.
use crate::core::batch::{Outcome, batch_element_exception};
use crate::core::error::Result;
use crate::core::reference::EntityReference;

/// Extra detail attached to element errors raised by throwing policies.
#[derive(Clone, Copy, Debug)]
pub struct ElementContext<'a> {
    pub access: Option<&'a str>,
    pub entity_references: &'a [EntityReference],
}

pub trait BatchElementErrorPolicy: Copy {
    type Batch<T>;
    type Single<T>;

    fn finish_batch<T>(
        outcomes: Vec<Outcome<T>>,
        context: ElementContext<'_>,
    ) -> Result<Self::Batch<T>>;

    fn finish_single<T>(
        outcome: Outcome<T>,
        context: ElementContext<'_>,
    ) -> Result<Self::Single<T>>;
}

/// Raise the first element error; the policy used when none is named.
#[derive(Clone, Copy, Debug)]
pub struct Default;

/// Raise the first element error.
#[derive(Clone, Copy, Debug)]
pub struct Exception;

/// Return every outcome, success or element error, in input order.
#[derive(Clone, Copy, Debug)]
pub struct Variant;

fn raise_first<T>(outcomes: Vec<Outcome<T>>, context: ElementContext<'_>) -> Result<Vec<T>> {
    let mut values = Vec::with_capacity(outcomes.len());
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(value) => values.push(value),
            Err(error) => {
                return Err(batch_element_exception(
                    error,
                    index,
                    context.access,
                    context.entity_references.get(index),
                ));
            }
        }
    }
    Ok(values)
}

fn raise_single<T>(outcome: Outcome<T>, context: ElementContext<'_>) -> Result<T> {
    outcome.map_err(|error| {
        batch_element_exception(error, 0, context.access, context.entity_references.first())
    })
}

impl BatchElementErrorPolicy for Default {
    type Batch<T> = Vec<T>;
    type Single<T> = T;

    fn finish_batch<T>(
        outcomes: Vec<Outcome<T>>,
        context: ElementContext<'_>,
    ) -> Result<Self::Batch<T>> {
        raise_first(outcomes, context)
    }

    fn finish_single<T>(
        outcome: Outcome<T>,
        context: ElementContext<'_>,
    ) -> Result<Self::Single<T>> {
        raise_single(outcome, context)
    }
}

impl BatchElementErrorPolicy for Exception {
    type Batch<T> = Vec<T>;
    type Single<T> = T;

    fn finish_batch<T>(
        outcomes: Vec<Outcome<T>>,
        context: ElementContext<'_>,
    ) -> Result<Self::Batch<T>> {
        raise_first(outcomes, context)
    }

    fn finish_single<T>(
        outcome: Outcome<T>,
        context: ElementContext<'_>,
    ) -> Result<Self::Single<T>> {
        raise_single(outcome, context)
    }
}

impl BatchElementErrorPolicy for Variant {
    type Batch<T> = Vec<Outcome<T>>;
    type Single<T> = Outcome<T>;

    fn finish_batch<T>(
        outcomes: Vec<Outcome<T>>,
        _context: ElementContext<'_>,
    ) -> Result<Self::Batch<T>> {
        Ok(outcomes)
    }

    fn finish_single<T>(
        outcome: Outcome<T>,
        _context: ElementContext<'_>,
    ) -> Result<Self::Single<T>> {
        Ok(outcome)
    }
}
