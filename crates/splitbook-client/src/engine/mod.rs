pub mod datekey;
pub mod dedupe;
pub mod distribution;
pub mod names;
pub mod window;
