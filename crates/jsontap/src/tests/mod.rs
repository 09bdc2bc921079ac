mod arbitrary;
mod listener;
