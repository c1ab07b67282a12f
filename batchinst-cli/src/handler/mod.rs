pub(crate) mod apps;
pub(crate) mod installed;
