//! Corridor Traffic Simulation Library
//!
//! A discrete-time, multi-lane highway simulation used to teach concurrency
//! concepts by analogy: vehicles are units of work, lanes are parallel paths,
//! the capacity-bounded merge ring is a critical section and the exit rate
//! limiters are slow consumers. The library runs headless; rendering and
//! control panels are external consumers of [`simulation::SimSnapshot`].

pub mod simulation;
