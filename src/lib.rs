pub mod shared {
    pub mod core {
        pub mod diff;
        pub mod diffable;
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod subscriptions;
    }
}

pub mod modules {
    pub mod time_entries {
        pub mod core {
            pub mod errors;
            pub mod evolve;
            pub mod messages;
            pub mod ports;
            pub mod record;
            pub mod reference;
            pub mod state;
        }
        pub mod projection {
            pub mod grouping;
            pub mod holders;
        }
        pub mod use_cases {
            pub mod decision;
            pub mod start_time_entry {
                pub mod command;
                pub mod decide;
                pub mod handler;
            }
            pub mod stop_time_entry {
                pub mod command;
                pub mod decide;
                pub mod handler;
            }
            pub mod continue_time_entry {
                pub mod command;
                pub mod decide;
                pub mod handler;
            }
            pub mod remove_time_entry {
                pub mod command;
                pub mod decide;
                pub mod handler;
            }
            pub mod migrate_storage {
                pub mod command;
                pub mod handler;
            }
            pub mod log_time_entries {
                pub mod view;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod in_memory_data_store;
                pub mod legacy_migrator;
            }
        }
    }
}

pub mod application {
    pub mod errors;
    pub mod store;
}

pub mod shell;
