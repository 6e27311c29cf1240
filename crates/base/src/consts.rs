pub mod binding {
    //! Names and paths defined by the service binding convention.

    /// Environment variable telling a workload where bindings are projected.
    pub const SERVICE_BINDING_ROOT: &str = "SERVICE_BINDING_ROOT";

    /// Binding root used when a container does not declare its own.
    pub const DEFAULT_BINDING_ROOT: &str = "/bindings";
}

pub mod k8s {
    pub mod kinds {
        pub const BATCH_V1: &str = "batch/v1";
        pub const CRON_JOB: &str = "CronJob";
    }
}
