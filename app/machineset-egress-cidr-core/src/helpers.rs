use std::any::type_name;

use kube::Resource;

pub fn pretty_type_name<'a, T>() -> &'a str {
    let name = type_name::<T>();

    name.rsplit("::").next().unwrap_or(name)
}

pub trait RequireMetadata<E> {
    fn require_name_or(&self, error: E) -> Result<&str, E>;
    fn require_name_or_else(&self, error: impl FnOnce() -> E) -> Result<&str, E>;
}

impl<T: Resource, E> RequireMetadata<E> for T {
    fn require_name_or(&self, error: E) -> Result<&str, E> {
        Ok(self
            .meta()
            .name
            .as_ref()
            .ok_or(error)?
            .as_str())
    }

    fn require_name_or_else(&self, error: impl FnOnce() -> E) -> Result<&str, E> {
        Ok(self
            .meta()
            .name
            .as_ref()
            .ok_or_else(error)?
            .as_str())
    }
}

#[cfg(test)]
mod tests {
    use crate::resources::hostsubnet::HostSubnet;

    use super::{pretty_type_name, RequireMetadata};

    #[test]
    fn pretty_type_name_strips_module_path() {
        assert_eq!(pretty_type_name::<HostSubnet>(), "HostSubnet");
    }

    #[test]
    fn require_name_fails_on_nameless_object() {
        let host_subnet = HostSubnet::default();

        assert_eq!(host_subnet.require_name_or("nameless"), Err("nameless"));
        assert_eq!(
            HostSubnet::new("node123").require_name_or_else(|| "nameless"),
            Ok("node123")
        );
    }
}
