mod common;
mod intake;
mod reasoning;
