mod test_scope_authorization;
mod test_token_lifecycle;
mod test_user_flow;
