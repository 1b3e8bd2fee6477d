pub mod differential_evolution;
