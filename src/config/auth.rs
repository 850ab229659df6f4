use std::fmt::Debug;

#[derive(Clone, Default)]
pub(crate) struct AuthInfo {
    pub username: String,
    pub password: String,
}

impl Debug for AuthInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "username: {}", self.username)?;
        Ok(())
    }
}

impl AuthInfo {
    pub fn username<U>(&mut self, u: U)
    where
        U: ToString,
    {
        self.username = u.to_string();
    }

    pub fn password<P>(&mut self, p: P)
    where
        P: ToString,
    {
        self.password = p.to_string();
    }
}
