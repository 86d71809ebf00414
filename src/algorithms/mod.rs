/// Particle swarm optimization and its building blocks
pub mod particles;
