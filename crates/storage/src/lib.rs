#![warn(clippy::pedantic)]

pub mod memory;

#[cfg(test)]
mod tests {
    pub mod data;
}
