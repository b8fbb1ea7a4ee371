pub mod proto {
    tonic::include_proto!("uttt");
}

pub mod config;
pub mod games;
pub mod logger;
pub mod move_log;

pub use games::ultimate_tictactoe;
