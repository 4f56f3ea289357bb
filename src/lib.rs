//! Core of the CLP practice quiz player: the quiz text parser, the
//! per-attempt session state machine and the quiz loader.

pub mod libclp;
