#[cfg(test)]
mod helpers;

#[cfg(test)]
mod analyzer_tests;
