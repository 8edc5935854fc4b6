use crate::api::{Credentials, Registration};
use crate::error::{ApiError, FormError};
use crate::session::User;

use super::form::{Form, TextField};
use super::request::{Op, Outbox, RequestId};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthKind {
    Login,
    Register,
}

/// Sign-in and sign-up forms share everything but their fields.
#[derive(Debug)]
pub struct AuthForm {
    pub kind: AuthKind,
    pub form: Form,
    pub error: Option<String>,
    pub submitting: bool,
    pending: Option<RequestId>,
}

impl AuthForm {
    pub fn login() -> Self {
        Self::with_fields(
            AuthKind::Login,
            vec![TextField::new("Email"), TextField::secret("Password")],
        )
    }

    pub fn register() -> Self {
        Self::with_fields(
            AuthKind::Register,
            vec![
                TextField::new("Name"),
                TextField::new("Email"),
                TextField::secret("Password"),
                TextField::secret("Confirm password"),
            ],
        )
    }

    fn with_fields(kind: AuthKind, fields: Vec<TextField>) -> Self {
        Self {
            kind,
            form: Form::new(fields),
            error: None,
            submitting: false,
            pending: None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            AuthKind::Login => " sign in ",
            AuthKind::Register => " create account ",
        }
    }

    pub fn input(&mut self, c: char) {
        if !self.submitting {
            self.form.insert(c);
        }
    }

    pub fn backspace(&mut self) {
        if !self.submitting {
            self.form.backspace();
        }
    }

    pub fn validate(&self) -> Result<Op, FormError> {
        match self.kind {
            AuthKind::Login => {
                let email = self.form.value(0).trim();
                let password = self.form.value(1);
                if email.is_empty() || password.is_empty() {
                    return Err(FormError::MissingCredentials);
                }
                Ok(Op::Login(Credentials {
                    email: email.to_string(),
                    password: password.to_string(),
                }))
            }
            AuthKind::Register => {
                let name = self.form.value(0).trim();
                let email = self.form.value(1).trim();
                let password = self.form.value(2);
                let confirmation = self.form.value(3);
                if name.is_empty() {
                    return Err(FormError::MissingName);
                }
                if email.is_empty() || password.is_empty() {
                    return Err(FormError::MissingCredentials);
                }
                if password != confirmation {
                    return Err(FormError::PasswordMismatch);
                }
                Ok(Op::Register(Registration {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    password_confirmation: confirmation.to_string(),
                }))
            }
        }
    }

    pub fn submit(&mut self, outbox: &mut Outbox) {
        if self.submitting {
            return;
        }
        self.error = None;
        match self.validate() {
            Ok(op) => {
                self.submitting = true;
                self.pending = Some(outbox.push(op));
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Returns the signed-in user on success. Passwords are wiped either way.
    pub fn receive(&mut self, id: RequestId, result: &Result<User, ApiError>) -> Option<User> {
        if self.pending != Some(id) {
            return None;
        }
        self.pending = None;
        self.submitting = false;
        match result {
            Ok(user) => {
                self.form.clear();
                self.error = None;
                Some(user.clone())
            }
            Err(e) => {
                self.clear_secrets();
                self.error = Some(e.detail());
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.form.clear();
        self.error = None;
        self.submitting = false;
        self.pending = None;
    }

    fn clear_secrets(&mut self) {
        for field in self.form.fields.iter_mut().filter(|f| f.secret) {
            field.value.clear();
        }
    }
}
