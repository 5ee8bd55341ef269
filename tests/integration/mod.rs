//! Integration Tests Module
//!
//! End-to-end coverage of the planning engine: dependency graph
//! construction, plan validation warnings, and sprint scheduling with
//! candidate repair.


// Plan validator warning taxonomy
mod validation_test;

// Sprint scheduler packing, repair, and determinism
mod scheduler_test;
