pub mod logfile;
