mod common;
mod evaluator;
mod refinement;
