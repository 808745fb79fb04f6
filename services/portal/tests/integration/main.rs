
mod activation_test;
mod admin_test;
mod guide_test;
mod router_test;
mod taxonomy_test;
