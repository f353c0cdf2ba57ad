mod consumer;
mod helper;
