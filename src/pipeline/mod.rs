pub mod extraction;
pub mod structuring;
pub mod processor;

#[cfg(test)]
pub(crate) mod test_support;
