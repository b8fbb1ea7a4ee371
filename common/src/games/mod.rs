mod session_rng;

pub mod ultimate_tictactoe;

pub use session_rng::SessionRng;
