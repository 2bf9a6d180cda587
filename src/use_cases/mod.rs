pub mod form_responses;
pub mod participants;

#[cfg(test)]
pub(crate) mod test_support;
