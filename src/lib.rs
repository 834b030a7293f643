pub mod shared {
    pub mod infrastructure {
        pub mod key_value_storage;
    }
}

pub mod modules {
    pub mod watch_time {
        pub mod core {
            pub mod clear_confirmation;
            pub mod duration;
            pub mod inspector;
            pub mod page;
            pub mod ports;
            pub mod record;
        }
        pub mod use_cases {
            pub mod sample_page {
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
                pub mod runner;
            }
            pub mod summarize_watch_time {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                    pub mod popup;
                }
                pub mod render;
                pub mod summary;
            }
            pub mod clear_watch_time {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod key_value_watch_time_store;
                pub mod pushed_page_state;
                pub mod scripted_page_state;
            }
        }
    }
}

pub mod shell;
