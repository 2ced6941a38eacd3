// Access modes accepted by each family of operations; names feed error messages.

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PolicyAccess {
    Read,
    Write,
    CreateRelated,
    Required,
    ManagerDriven,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ResolveAccess {
    Read,
    ManagerDriven,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PublishingAccess {
    Write,
    CreateRelated,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EntityTraitsAccess {
    Read,
    Write,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DefaultEntityAccess {
    Read,
    Write,
    CreateRelated,
}

impl PolicyAccess {
    pub fn name(self) -> &'static str {
        match self {
            PolicyAccess::Read => "read",
            PolicyAccess::Write => "write",
            PolicyAccess::CreateRelated => "createRelated",
            PolicyAccess::Required => "required",
            PolicyAccess::ManagerDriven => "managerDriven",
        }
    }
}

impl ResolveAccess {
    pub fn name(self) -> &'static str {
        match self {
            ResolveAccess::Read => "read",
            ResolveAccess::ManagerDriven => "managerDriven",
        }
    }
}

impl PublishingAccess {
    pub fn name(self) -> &'static str {
        match self {
            PublishingAccess::Write => "write",
            PublishingAccess::CreateRelated => "createRelated",
        }
    }
}

impl EntityTraitsAccess {
    pub fn name(self) -> &'static str {
        match self {
            EntityTraitsAccess::Read => "read",
            EntityTraitsAccess::Write => "write",
        }
    }
}

impl DefaultEntityAccess {
    pub fn name(self) -> &'static str {
        match self {
            DefaultEntityAccess::Read => "read",
            DefaultEntityAccess::Write => "write",
            DefaultEntityAccess::CreateRelated => "createRelated",
        }
    }
}
