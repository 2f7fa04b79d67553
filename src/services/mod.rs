pub mod documentation;
pub mod health_service;
pub mod jellyfin_service;
pub mod room_service;
pub mod tally;
pub mod winner_service;

#[cfg(test)]
pub(crate) mod test_support;
