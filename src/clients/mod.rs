pub mod ansi;
pub mod command;
pub mod gcalcli;
pub mod lines;
pub mod mcal;
pub mod tmux;
