pub(crate) mod fs_store;
pub(crate) mod path;
pub(crate) mod record;
pub(crate) mod store;
pub(crate) mod writer;
