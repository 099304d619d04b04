pub mod docker;

pub use docker::DockerCliAdapter;
