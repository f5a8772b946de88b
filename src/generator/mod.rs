pub mod generator;

#[cfg(test)]
mod tests;
