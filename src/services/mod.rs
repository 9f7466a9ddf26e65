mod launcher;

pub use launcher::NodeLauncher;
