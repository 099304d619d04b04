mod client;
mod parser;

pub use client::DockerCliAdapter;
