mod flip;
mod recombine;
