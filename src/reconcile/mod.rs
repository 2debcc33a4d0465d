pub(crate) mod reconciler;
