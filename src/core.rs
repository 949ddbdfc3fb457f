pub mod dataset;

pub mod engine;

pub mod reservoir;

pub mod sketch;

pub mod bounds;

pub mod partition;
