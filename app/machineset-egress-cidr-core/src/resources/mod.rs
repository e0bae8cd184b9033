pub mod hostsubnet;
pub mod machine;
