//! bookwiki: a flat-file wiki served over HTTP, plus a small relational
//! book catalogue exercised by a startup demo.

pub mod demo;
