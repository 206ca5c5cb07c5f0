//! Tests for the simulation engine.
