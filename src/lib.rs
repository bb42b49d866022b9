// Crate entry point. Declares the modules so the binary and the integration tests can import them.
//
// Responsibilities
// - Only declare and expose modules. No business logic here.

pub mod core {
    pub mod ports;
    pub mod time_card;
}

pub mod application {
    pub mod current_time_card;
    pub mod errors;
    pub mod ticker;
}

pub mod adapters {
    pub mod clock {
        pub mod manual_clock;
        pub mod system_clock;
    }
    pub mod in_memory {
        pub mod in_memory_time_card_repository;
    }
}

pub mod shell;
