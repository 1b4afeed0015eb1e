pub(crate) mod expenses;
pub(crate) mod form;
pub(crate) mod summary;
