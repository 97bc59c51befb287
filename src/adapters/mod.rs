pub mod capture;
pub mod ses;
