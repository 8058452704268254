pub mod dev_admin_seed;
