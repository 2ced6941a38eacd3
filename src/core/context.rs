//! Purpose: Per-call context handed to every manager operation.
//! Exports: `Context`, `ContextPtr`, `ManagerStateBase`.
//! Role: Hosts build a context once and share it across related calls.
//! Invariants: Immutable once shared; manager state is opaque to the host.
use crate::core::traits_data::TraitsData;
use std::fmt::Debug;
use std::sync::Arc;

/// Manager-private state token carried opaquely through a context.
pub trait ManagerStateBase: Send + Sync + Debug {}

#[derive(Clone, Debug, Default)]
pub struct Context {
    pub locale: Option<TraitsData>,
    pub manager_state: Option<Arc<dyn ManagerStateBase>>,
}

pub type ContextPtr = Arc<Context>;

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: TraitsData) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn with_manager_state(mut self, state: Arc<dyn ManagerStateBase>) -> Self {
        self.manager_state = Some(state);
        self
    }

    pub fn into_shared(self) -> ContextPtr {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, ManagerStateBase};
    use crate::core::traits_data::TraitsData;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Token(u32);
    impl ManagerStateBase for Token {}

    #[test]
    fn builder_sets_locale_and_state() {
        let mut locale = TraitsData::new();
        locale.add_trait("locale.cli");
        let context = Context::new()
            .with_locale(locale.clone())
            .with_manager_state(Arc::new(Token(7)))
            .into_shared();
        assert_eq!(context.locale.as_ref(), Some(&locale));
        assert!(context.manager_state.is_some());
        assert!(Context::new().locale.is_none());
    }
}
