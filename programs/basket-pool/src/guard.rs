use anchor_lang::prelude::*;

use crate::error::ErrorCode;
use crate::state::Pool;

impl Pool {
    pub fn only_owner(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.owner, ErrorCode::Unauthorized);
        Ok(())
    }

    pub fn when_not_paused(&self) -> Result<()> {
        require!(!self.paused, ErrorCode::Paused);
        Ok(())
    }

    pub fn when_paused(&self) -> Result<()> {
        require!(self.paused, ErrorCode::NotPaused);
        Ok(())
    }

    pub fn pause(&mut self, caller: &Pubkey) -> Result<()> {
        self.only_owner(caller)?;
        self.when_not_paused()?;
        self.paused = true;
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Pubkey) -> Result<()> {
        self.only_owner(caller)?;
        self.when_paused()?;
        self.paused = false;
        Ok(())
    }

    /// Hands pause control and the parameter setters to `new_owner`.
    pub fn transfer_ownership(&mut self, caller: &Pubkey, new_owner: Pubkey) -> Result<Pubkey> {
        self.only_owner(caller)?;
        require!(new_owner != Pubkey::default(), ErrorCode::ZeroOwner);

        let previous = self.owner;
        self.owner = new_owner;
        Ok(previous)
    }
}
