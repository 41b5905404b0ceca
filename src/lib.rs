//! City Agent Simulation Library
//!
//! Simulates autonomous traffic vehicles and pedestrians on a tile-based
//! city map, reacting to lane geometry, intersections, other agents, and an
//! externally-controlled player avatar.

pub mod simulation;
