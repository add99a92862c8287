pub mod chord;
